// ###################################
// ->   Error format chain
// ###################################
/// Calls `Error::source()` on a chain of errors and joins their messages into one line.
/// `reqwest` keeps the interesting part (timeout, refused connection, ...) in the sources.
pub fn error_chain_string(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut current_src = e.source();
    while let Some(cause) = current_src {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        current_src = cause.source();
    }

    out
}
