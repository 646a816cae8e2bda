use std::fmt;

use clap::ValueEnum;

/// Method (from NIAK) used to resample the data under the null hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResamplingMethod {
    /// Circular-block-bootstrap sample of multiple time series
    #[value(name = "CBB")]
    Cbb,
    /// Auto-regressive temporal model with i.i.d. bootstrap of the innovations
    #[value(name = "AR1B")]
    Ar1b,
    /// Gaussian model with spatial correlations and AR(1) temporal correlations
    #[value(name = "AR1G")]
    Ar1g,
}

/// How the dictionary is initialized before sparse dictionary learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DictInitMethod {
    /// Random permutation of the raw data
    #[value(name = "GivenMatrix")]
    GivenMatrix,
    /// First N (number of atoms) columns of the raw data
    #[value(name = "DataElements")]
    DataElements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SparseCodingMethod {
    #[value(name = "OMP")]
    Omp,
    #[value(name = "Thresholding")]
    Thresholding,
}

/// Sub-pipeline of a SPARK analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Sparse GLM parameters estimation and bootstrap resampling
    #[value(name = "A")]
    A,
    /// Sparse dictionary learning
    #[value(name = "B")]
    B,
    /// k-hubness map generation
    #[value(name = "C")]
    C,
}

impl ResamplingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cbb => "CBB",
            Self::Ar1b => "AR1B",
            Self::Ar1g => "AR1G",
        }
    }
}

impl DictInitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GivenMatrix => "GivenMatrix",
            Self::DataElements => "DataElements",
        }
    }
}

impl SparseCodingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Omp => "OMP",
            Self::Thresholding => "Thresholding",
        }
    }
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(ResamplingMethod, DictInitMethod, SparseCodingMethod, Stage);
