#[derive(Debug, Clone)]
pub enum ModalMessage {
    Close,
    /// Next step, or submit on the terminal one
    Confirm,
    PrevStep,
    CycleNext,
    CyclePrev,
    Input(char),
    Backspace,
}
