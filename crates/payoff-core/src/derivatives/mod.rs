pub mod collar;
pub mod futures;
