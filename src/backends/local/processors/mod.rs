// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod change_text_case;
pub mod reverse_text;
pub mod token_counter;
pub mod word_frequency_analyzer;
pub mod prefix_suffix_adder;

pub use change_text_case::*;
pub use reverse_text::*;
pub use token_counter::*;
pub use word_frequency_analyzer::*;
pub use prefix_suffix_adder::*;
