//! Content management module.
//!
//! This module provides:
//! - Field specs and validation shared by every editable shape
//! - The five block types and the content stream that orders them
//! - BlockTypeRegistry: block type definitions for form builders
//! - Stream rendering through block templates
//! - Admin panel layouts
//! - PageService: validated page and hero slide writes

pub mod block_render;
pub mod block_types;
pub mod blocks;
pub mod fields;
mod page_service;
pub mod panels;
pub mod stream;

pub use block_render::render_stream;
pub use block_types::{BlockTypeDefinition, BlockTypeRegistry};
pub use fields::{FieldError, FieldSpec, ValidationErrors};
pub use page_service::PageService;
pub use stream::{ContentBlock, ContentStream, StreamChild};
