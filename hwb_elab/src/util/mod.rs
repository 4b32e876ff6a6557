pub mod arena;

#[macro_export]
macro_rules! throw {
    ($e:expr) => {
        return Err($e.into())
    };
}
