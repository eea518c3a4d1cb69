pub mod check;
pub mod guide;
