/// Variant of `write!` that only works for strings, and so cannot actually fail.
#[macro_export]
macro_rules! swrite {
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        let dst: &mut String = $dst;
        write!(dst, $($arg)*).unwrap();
    }};
}

/// Variant of `writeln!` that only works for strings, and so cannot actually fail.
#[macro_export]
macro_rules! swriteln {
    ($dst:expr $(,)?) => {{
        use std::fmt::Write;
        let dst: &mut String = $dst;
        writeln!(dst).unwrap();
    }};
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        let dst: &mut String = $dst;
        writeln!(dst, $($arg)*).unwrap();
    }};
}

#[cfg(test)]
mod test {
    #[test]
    fn swrite_basic() {
        let mut s = String::new();
        swrite!(&mut s, "a={}", 1);
        swriteln!(&mut s, " b={}", 2);
        assert_eq!(s, "a=1 b=2\n");
    }
}
