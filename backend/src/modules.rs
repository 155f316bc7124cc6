#[macro_export]
macro_rules! include_modules {
    () => {
        extern crate env_logger;
        pub mod processing;
        pub mod repository;
        pub mod tools;
        pub mod utils;
    }
}
