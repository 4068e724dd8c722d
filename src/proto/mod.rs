// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

// Module declaration for generated protobuf code
#[path = "processor.v1.rs"]
pub mod processor_v1;

// Re-export the types for easier access
pub use processor_v1::{ProcessorRequest, ProcessorResponse};
