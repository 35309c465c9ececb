pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    /// Converts the result into an [`Option`], logging the error as a warning.
    ///
    /// Used for entry-local failures that must not abort a reconciliation pass.
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_log_keeps_value() {
        let res: std::result::Result<u8, std::io::Error> = Ok(7);
        assert_eq!(res.ok_log(), Some(7));
    }

    #[test]
    fn test_ok_log_drops_error() {
        let res: std::result::Result<u8, std::io::Error> =
            Err(std::io::Error::other("boom"));
        assert_eq!(res.ok_log(), None);
    }
}
