pub mod classroom;
pub mod course;
pub mod modification;
pub mod slot;
pub mod timetable;

pub use classroom::{AvailableRoomsRequest, Classroom};
pub use course::Course;
pub use modification::{
    CancelRequest, Modification, ModificationType, NewModification, PostponeRequest,
};
pub use slot::{ClassDetail, RegularSlot};
pub use timetable::TimetableEntry;
