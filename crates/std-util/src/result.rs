/// Unwraps the `Err` side of a result, panicking with the `Ok` value
/// otherwise. Extra format arguments are appended to the panic message.
#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Err`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => panic!("expected `Ok`; error={}", err),
        }
    };
}

/// Asserts that an error's `Display` output mentions every given fragment.
#[macro_export]
macro_rules! assert_err_mentions {
    ($err:expr, $($fragment:expr),+ $(,)?) => {{
        let msg = $err.to_string();
        $(
            assert!(
                msg.contains($fragment),
                "error should mention `{}`, got: {}",
                $fragment,
                msg
            );
        )+
    }};
}
