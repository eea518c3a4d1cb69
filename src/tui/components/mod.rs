pub mod chart;
pub mod customer_form;
pub mod form;
pub mod header;
pub mod help;
pub mod logs;
pub mod result;
pub mod sidebar;
pub mod site_form;
