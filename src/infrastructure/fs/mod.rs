pub mod cities_list;
pub mod json_store;
