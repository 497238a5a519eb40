use crate::xmlchar;
use nom::bytes::complete::take_until;
use nom::combinator::verify;
use nom::IResult;

// -----------------------------------------------------------------------------------------------

/// Recognizes XML characters up to, not including, `terminator`.
///
/// Fails when `terminator` never occurs or when a non XML character precedes it.
pub fn take_chars_until<'a>(
    terminator: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        verify(take_until(terminator), |v: &str| v.chars().all(xmlchar::is_char))(input)
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nom::error::{Error, ErrorKind};
    use nom::Err;

    #[test]
    fn test_take_chars_until() {
        let (rest, ret) = take_chars_until("?>")("aaa?>").unwrap();
        assert_eq!("?>", rest);
        assert_eq!("aaa", ret);

        let (rest, ret) = take_chars_until("?>")("?>").unwrap();
        assert_eq!("?>", rest);
        assert_eq!("", ret);

        let err = take_chars_until("?>")("aaa").err().unwrap();
        assert_eq!(Err::Error(Error::new("aaa", ErrorKind::TakeUntil)), err);

        let err = take_chars_until("?>")("a\u{1}a?>").err().unwrap();
        assert_eq!(Err::Error(Error::new("a\u{1}a?>", ErrorKind::Verify)), err);
    }
}
