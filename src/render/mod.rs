pub(crate) mod frame;
pub(crate) mod scheduler;
pub(crate) mod surface;
pub(crate) mod text;
