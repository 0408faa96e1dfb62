pub mod city;
pub mod fetch_plan;
pub mod lenient;
pub mod rolling_window;
