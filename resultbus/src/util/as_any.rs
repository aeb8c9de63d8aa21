use std::any::{self, Any};

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;

    fn as_boxed_any(self: Box<Self>) -> Box<dyn Any>;

    // Name of the concrete type behind a trait object, for log output.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_boxed_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}
