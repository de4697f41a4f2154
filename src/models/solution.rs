//! Solution model

/// Pure transform from a problem input to an output
pub type Transform<I, O> = fn(&I) -> O;

/// One registered implementation of a problem
pub struct Solution<I, O> {
    pub transform: Transform<I, O>,
    pub impl_name: String,
    pub student_name: String,
}

impl<I, O> Solution<I, O> {
    pub fn new(
        transform: Transform<I, O>,
        impl_name: impl Into<String>,
        student_name: impl Into<String>,
    ) -> Self {
        Self {
            transform,
            impl_name: impl_name.into(),
            student_name: student_name.into(),
        }
    }

    /// Apply the transform
    #[inline]
    pub fn apply(&self, input: &I) -> O {
        (self.transform)(input)
    }
}

impl<I, O> std::fmt::Debug for Solution<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solution")
            .field("impl_name", &self.impl_name)
            .field("student_name", &self.student_name)
            .finish_non_exhaustive()
    }
}
