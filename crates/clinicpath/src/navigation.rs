//! Navigation capability supplied by the hosting surface.

/// Moves the visitor to another location. Routing itself lives in the host.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str);
    fn go_back(&mut self);
}

/// What a [`RedirectNavigator`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    To(String),
    Back,
}

/// Records the requested navigation so an HTTP handler can turn it into a
/// redirect response.
#[derive(Debug, Default)]
pub struct RedirectNavigator {
    navigation: Option<Navigation>,
}

impl RedirectNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }
}

impl Navigator for RedirectNavigator {
    fn navigate_to(&mut self, path: &str) {
        self.navigation = Some(Navigation::To(path.to_string()));
    }

    fn go_back(&mut self) {
        self.navigation = Some(Navigation::Back);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Navigation, Navigator};

    #[derive(Debug, Default)]
    pub(crate) struct RecordingNavigator {
        pub(crate) calls: Vec<Navigation>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&mut self, path: &str) {
            self.calls.push(Navigation::To(path.to_string()));
        }

        fn go_back(&mut self) {
            self.calls.push(Navigation::Back);
        }
    }
}
