use time::{error::IndeterminateOffset, Date, OffsetDateTime, UtcOffset};

/// Source of the current date
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

/// Reads the system clock on every call, converting to the local UTC offset
/// that was in effect at construction
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LocalClock {
    offset: UtcOffset,
}

impl LocalClock {
    pub(crate) fn new() -> Result<LocalClock, IndeterminateOffset> {
        let offset = UtcOffset::current_local_offset()?;
        Ok(LocalClock { offset })
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
