/// The rendering host the UI draws into and asks questions of.
///
/// Implementations own every host-specific detail; the UI only hands over
/// finished markup.
pub trait ViewHost {
    /// Replace the project/todo list pane.
    fn show_list(&mut self, markup: &str);

    /// Replace the detail pane (entity form, create form, or the idle hint).
    fn show_detail(&mut self, markup: &str);

    /// Gate before a destructive action. `false` cancels it.
    fn confirm(&mut self, message: &str) -> bool;

    /// Report a validation problem to the user.
    fn alert(&mut self, message: &str);
}
