pub mod cycles;
pub mod dashboard;
pub mod invoices;
pub mod rules;
