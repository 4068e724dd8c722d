// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
#[cfg(test)]
pub mod integration_tests;
pub mod level_by_level;
pub mod pipeline_metadata;
pub mod priority_work_queue;
pub mod reactive;
pub mod work_queue;

pub use factory::ExecutorFactory;
pub use level_by_level::LevelByLevelExecutor;
pub use reactive::ReactiveExecutor;
pub use work_queue::WorkQueueExecutor;
