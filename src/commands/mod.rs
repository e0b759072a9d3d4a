pub mod municipalities;
pub mod regions;
