//! `Record` and `Editable` impls for every management page.

mod general_group;
mod parent_event;
mod participant;
mod period;
mod session;
mod small_group;
mod user;

pub use small_group::CYCLES;
