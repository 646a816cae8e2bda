/// Which jobs of a sub-pipeline the SPARK application should run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobFilter {
    /// Run every job.
    #[default]
    All,
    /// 1-based job indices.
    Indices(Vec<u32>),
    /// Strings matched against job names.
    Patterns(Vec<String>),
}

impl JobFilter {
    /// Patterns take precedence over indices when both are given.
    pub fn new(indices: Vec<u32>, patterns: Vec<String>) -> Self {
        if !patterns.is_empty() {
            Self::Patterns(patterns)
        } else if !indices.is_empty() {
            Self::Indices(indices)
        } else {
            Self::All
        }
    }

    /// Trailing command-line arguments for `<exe> run`.
    /// Indices are packed into a single `1;2;3;` argument.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::All => Vec::with_capacity(0),
            Self::Indices(indices) => {
                let mut packed = String::with_capacity(indices.len() * 3);
                for i in indices {
                    packed.push_str(&i.to_string());
                    packed.push(';');
                }
                vec![packed]
            }
            Self::Patterns(patterns) => patterns.clone(),
        }
    }
}
