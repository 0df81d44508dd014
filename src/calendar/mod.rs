mod grid;
mod picker;
mod util;
mod widget;
pub(crate) use self::picker::{Booking, DatePicker};
pub(crate) use self::util::{parse_iso_date, ParseDateError};
pub(crate) use self::widget::MonthView;
