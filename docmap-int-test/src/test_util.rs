use docmap::errors::{ErrorKind, MappingError, MappingResult};
use docmap::mapping::{MappingConverter, MappingConverterBuilder};
use std::backtrace::Backtrace;
use std::time::Instant;

/// Everything a test needs: the converter under test.
#[derive(Clone, Debug)]
pub struct TestContext {
    converter: MappingConverter,
}

impl TestContext {
    pub fn new(converter: MappingConverter) -> Self {
        TestContext { converter }
    }

    pub fn converter(&self) -> &MappingConverter {
        &self.converter
    }
}

/// Runs a test against the context built by `before`.
///
/// Failures of `before` and `test` as well as panics are reported with the
/// elapsed time and a backtrace, then the test panics.
pub fn run_test<T, B>(before: B, test: T)
where
    T: Fn(TestContext) -> MappingResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> MappingResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx) {
                Ok(_) => Ok(()),
                Err(e) => Err((describe("Test failed", &e), backtrace.to_string())),
            },
            Err(e) => Err((describe("Before run failed", &e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();
    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err(failure)) => failure,
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), String::new())
        }
    };

    eprintln!("\n========== Test Failed (took {:?}) ==========", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() {
        eprintln!("Backtrace:\n{}", backtrace);
    }
    panic!("{}", error);
}

fn describe(prefix: &str, error: &MappingError) -> String {
    let mut text = format!("{}: {} [{}]", prefix, error, error.kind());
    let mut cause = error.cause();
    while let Some(e) = cause {
        text.push_str(&format!("\n  caused by: {} [{}]", e, e.kind()));
        cause = e.cause();
    }
    text
}

/// Builds a test context from a configured converter builder.
pub fn create_test_context(builder: MappingConverterBuilder) -> MappingResult<TestContext> {
    Ok(TestContext::new(builder.build()?))
}

/// Asserts that the result failed with the given kind somewhere in its cause
/// chain.
pub fn assert_error_kind<T: std::fmt::Debug>(result: MappingResult<T>, kind: ErrorKind) -> MappingError {
    match result {
        Ok(value) => panic!("Expected {} but got {:?}", kind, value),
        Err(e) => {
            assert!(
                e.has_kind(&kind),
                "Expected {} but got {}",
                kind,
                describe("error", &e)
            );
            e
        }
    }
}
