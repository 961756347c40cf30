//! State module for tracking collection progress
//!
//! # Components
//!
//! - `PageStop`: Why a pagination loop stopped requesting pages
//! - `SubjectState`: Lifecycle of one subject's orchestration within a batch

mod page_stop;
mod subject_state;

pub use page_stop::PageStop;
pub use subject_state::SubjectState;
