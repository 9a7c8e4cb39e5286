//! Static homepage payload.
//!
//! Placeholder company data served at `/api/home` and exposed to page
//! templates as `api_data`. The same value is returned on every call.

use serde::Serialize;

/// One service summary in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub email: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
}

/// Company overview returned by [`HomeApiResponse::get_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HomeApiData {
    pub company: &'static str,
    pub overview: &'static str,
    pub services: &'static [ServiceSummary],
    pub contact: ContactInfo,
}

const DATA: HomeApiData = HomeApiData {
    company: "VirtuSys Global",
    overview: "Empowering global businesses through IT innovation.",
    services: &[
        ServiceSummary {
            title: "Cloud Infrastructure",
            description: "Scalable, secure cloud migration and optimization services.",
        },
        ServiceSummary {
            title: "AI & Automation",
            description: "Intelligent process automation for enterprise growth.",
        },
        ServiceSummary {
            title: "Cybersecurity",
            description: "Advanced, proactive defense systems for digital resilience.",
        },
    ],
    contact: ContactInfo {
        email: "info@virtusysglobal.com",
        phone: "+1 (800) 555-0199",
        address: "500 Park Avenue, New York, NY, USA",
    },
};

/// Accessor for the static homepage payload.
pub struct HomeApiResponse;

impl HomeApiResponse {
    pub fn get_data() -> HomeApiData {
        DATA
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_identical_across_calls() {
        assert_eq!(HomeApiResponse::get_data(), HomeApiResponse::get_data());
        assert_eq!(
            serde_json::to_value(HomeApiResponse::get_data()).unwrap(),
            serde_json::to_value(HomeApiResponse::get_data()).unwrap()
        );
    }

    #[test]
    fn payload_shape() {
        let value = serde_json::to_value(HomeApiResponse::get_data()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["company", "contact", "overview", "services"]);

        let services = value["services"].as_array().unwrap();
        assert_eq!(services.len(), 3);
        for service in services {
            let mut keys: Vec<_> = service.as_object().unwrap().keys().cloned().collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["description", "title"]);
        }

        let mut contact: Vec<_> = value["contact"].as_object().unwrap().keys().cloned().collect();
        contact.sort_unstable();
        assert_eq!(contact, vec!["address", "email", "phone"]);
    }

    #[test]
    fn payload_values() {
        let data = HomeApiResponse::get_data();
        assert_eq!(data.company, "VirtuSys Global");
        assert_eq!(data.services[1].title, "AI & Automation");
        assert_eq!(data.contact.email, "info@virtusysglobal.com");
    }
}
