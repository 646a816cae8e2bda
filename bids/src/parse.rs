use crate::Error;

/// Modality suffix of a functional file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Bold,
    Cbv,
    Phase,
    Sbref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    NiiGz,
    Nii,
    Json,
}

/// Entities of a BIDS functional filename, e.g.
/// `sub-01_ses-02_task-rest_run-1_bold.nii.gz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncName {
    pub subject: String,
    pub session: Option<String>,
    pub task: String,
    pub acquisition: Option<String>,
    pub contrast: Option<String>,
    pub reconstruction: Option<String>,
    pub direction: Option<String>,
    pub run: Option<String>,
    pub echo: Option<String>,
    pub part: Option<String>,
    pub suffix: Suffix,
    pub extension: Extension,
}

/// Parse a bare filename (no directories) against the BIDS `func` naming rules.
pub fn parse_func_filename(name: &str) -> Result<FuncName, Error> {
    use combine::EasyParser;
    grammar::func_name()
        .easy_parse(name)
        .map(|(parsed, _remainder)| parsed)
        .map_err(|e| {
            let e = e.map_position(|p| p.translate_position(name));
            // combine's errors borrow the input, so stringify before returning.
            Error::Parse {
                name: name.to_owned(),
                pos: e.position,
                msg: e.to_string(),
            }
        })
}

mod grammar {
    use super::{Extension, FuncName, Suffix};
    use combine::parser::char::{alpha_num, char, digit, string};
    use combine::{attempt, choice, eof, many1, optional, ParseError, Parser, Stream};

    pub fn label<Input>() -> impl Parser<Input, Output = String>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        many1::<String, _, _>(alpha_num())
    }

    pub fn index<Input>() -> impl Parser<Input, Output = String>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        many1::<String, _, _>(digit())
    }

    // `_key-`; backtracks so an absent optional entity consumes nothing.
    fn key<Input>(key: &'static str) -> impl Parser<Input, Output = ()>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        attempt((char('_'), string(key), char('-'))).map(|_| ())
    }

    pub fn entity<Input>(k: &'static str) -> impl Parser<Input, Output = String>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        key(k).with(label())
    }

    pub fn numbered<Input>(k: &'static str) -> impl Parser<Input, Output = String>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        key(k).with(index())
    }

    pub fn suffix<Input>() -> impl Parser<Input, Output = Suffix>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        char('_').with(choice((
            attempt(string("bold")).map(|_| Suffix::Bold),
            attempt(string("cbv")).map(|_| Suffix::Cbv),
            attempt(string("phase")).map(|_| Suffix::Phase),
            string("sbref").map(|_| Suffix::Sbref),
        )))
    }

    pub fn extension<Input>() -> impl Parser<Input, Output = Extension>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        char('.').with(choice((
            attempt(string("nii.gz")).map(|_| Extension::NiiGz),
            attempt(string("nii")).map(|_| Extension::Nii),
            string("json").map(|_| Extension::Json),
        )))
    }

    pub fn func_name<Input>() -> impl Parser<Input, Output = FuncName>
    where
        Input: Stream<Token = char>,
        Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    {
        (
            (
                string("sub-").with(label()),
                optional(entity("ses")),
                entity("task"),
            ),
            (
                optional(entity("acq")),
                optional(entity("ce")),
                optional(entity("rec")),
                optional(entity("dir")),
            ),
            (
                optional(numbered("run")),
                optional(numbered("echo")),
                optional(entity("part")),
            ),
            suffix(),
            extension(),
        )
            .skip(eof())
            .map(
                |(
                    (subject, session, task),
                    (acquisition, contrast, reconstruction, direction),
                    (run, echo, part),
                    suffix,
                    extension,
                )| FuncName {
                    subject,
                    session,
                    task,
                    acquisition,
                    contrast,
                    reconstruction,
                    direction,
                    run,
                    echo,
                    part,
                    suffix,
                    extension,
                },
            )
    }

}
