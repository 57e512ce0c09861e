pub mod failure;
pub mod flows;
pub mod live;
pub mod load_state;
pub mod models;
pub mod paging;
pub mod services;
pub mod sports;
