//! Integration tests for the visibility protocol across mixed trees

mod propagation;
