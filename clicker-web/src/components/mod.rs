pub mod nav_bar;
pub mod shell;
