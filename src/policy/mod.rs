//! Business rules applied on top of verified licenses.

pub mod license;
