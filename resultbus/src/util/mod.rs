pub use self::as_any::AsAny;

mod as_any;
