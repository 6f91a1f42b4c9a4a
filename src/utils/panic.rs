/// Colorized panic reports with backtraces, written to stderr
pub fn setup() {
    color_backtrace::install();
}
