pub mod completion;

pub use completion::CompletionProvider;
