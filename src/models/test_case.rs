//! Test case model

/// One input with its expected output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> TestCase<I, O> {
    pub fn new(input: impl Into<I>, output: impl Into<O>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A named, borrowed set of test cases
#[derive(Debug)]
pub struct TestCaseSource<'a, I, O> {
    pub cases: &'a [TestCase<I, O>],
    pub source_name: &'a str,
}

impl<'a, I, O> TestCaseSource<'a, I, O> {
    pub fn new(cases: &'a [TestCase<I, O>], source_name: &'a str) -> Self {
        Self { cases, source_name }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

// Manual impls: a source is two references, copyable whatever I and O are.
impl<I, O> Clone for TestCaseSource<'_, I, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, O> Copy for TestCaseSource<'_, I, O> {}

/// Diagnostic tag of a single case, e.g. `[compile-time/1]`
pub fn case_tag(source_name: &str, index: usize) -> String {
    format!("[{source_name}/{index}]")
}
