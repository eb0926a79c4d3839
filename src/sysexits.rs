//! Exit status codes used by the `pbk` process boundary.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+11.2-stable&arch=default&format=html)

/// value: 64 <br>
/// The command line was malformed, e.g. too many profile paths.
pub const EX_USAGE: i32 = 64;

/// value: 70 <br>
/// The session crashed with an error outside the recoverable taxonomy.
pub const EX_SOFTWARE: i32 = 70;
