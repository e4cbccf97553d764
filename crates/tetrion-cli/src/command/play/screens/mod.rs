pub(crate) use self::{options::OptionsScreen, play::PlayScreen};

mod options;
mod play;
