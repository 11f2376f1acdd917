mod complaint;

pub use complaint::{
    Complaint, ComplaintFilter, ComplaintRecord, ComplaintStatus, NewComplaint, Priority,
    StatusWrite,
};
