//! `resolv.conf` nameserver extraction.
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::space1;
use nom::sequence::preceded;
use nom::IResult;

fn nameserver_line(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("nameserver"),
        preceded(space1, take_while1(|c: char| !c.is_whitespace())),
    )(input)
}

/// Addresses of all `nameserver` lines, in file order. Duplicates are kept.
pub fn nameservers(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| nameserver_line(line).ok().map(|(_, addr)| addr))
        .collect()
}
