pub mod fields;
pub mod record;
pub mod section;

pub use fields::{FlattenedFields, SlotKind};
pub use record::{Education, Experience, Project, ResumeRecord};
pub use section::{Section, SectionDescriptor};
