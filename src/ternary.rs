/// A ternary expression macro.  Rust's `if` is already an expression,
/// but `cargo fmt` insists on spreading it over five lines, and the
/// boundary-clamping tables in the cost and seam code are far easier
/// to read as single-line conditionals.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
