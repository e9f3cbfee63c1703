pub mod vindicia;

pub use self::vindicia::Vindicia;

pub mod macros;
