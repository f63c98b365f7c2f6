//! Observer port: receivers of device notifications.

/// Receives formatted `"<device>: <message>"` notifications.
///
/// Called synchronously, in registration order, after the device has
/// finished its transition.
pub trait Observer: Send + Sync {
    fn update(&self, message: &str);
}

impl<F> Observer for F
where
    F: Fn(&str) + Send + Sync,
{
    fn update(&self, message: &str) {
        self(message);
    }
}
