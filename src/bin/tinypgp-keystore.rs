//! Turn a canonical S-expression private key into Rust source for a
//! compile time keystore.
//!
//! Usage: tinypgp-keystore --keyid <16 hex digits> [--passphrase <pw>]
//!        [--name <ident>] <file|->
//!
//! The key id cannot be derived from the bare parameters, so it has to be
//! supplied by the caller (`gpg --list-keys --with-colons` shows it).

use std::io::Read;
use std::process::exit;

use tinypgp::errors::Result;
use tinypgp::protect;
use tinypgp::sexp::SexpCursor;

const PGM: &str = "tinypgp-keystore";

/// The six RSA parameters in keystore order.
const PARAM_NAMES: [&[u8]; 6] = [b"n", b"e", b"d", b"p", b"q", b"u"];

fn usage() -> ! {
    eprintln!(
        "usage: {PGM} --keyid <16 hex digits> [--passphrase <pw>] [--name <ident>] <file|->"
    );
    exit(2);
}

fn read_input(fname: &str) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if fname == "-" {
        std::io::stdin().read_to_end(&mut buf)?;
    } else {
        buf = std::fs::read(fname)?;
    }
    Ok(buf)
}

/// Pull n, e, d, p, q, u out of a plain `(private-key (rsa ...))`.
fn parse_private_key(key: &[u8]) -> Result<[Vec<u8>; 6]> {
    use tinypgp::errors::Error;

    let mut cur = SexpCursor::new(key);
    cur.expect(b'(')?;
    if cur.atom()? != b"private-key" {
        return Err(Error::UnexpectedData);
    }
    cur.expect(b'(')?;
    if cur.atom()? != b"rsa" {
        return Err(Error::InvalidAlgo { algo: 0 });
    }

    let mut params: [Option<Vec<u8>>; 6] = Default::default();
    while cur.peek() == Some(b'(') {
        cur.expect(b'(')?;
        let name = cur.atom()?;
        let value = cur.atom()?;
        cur.expect(b')')?;
        if let Some(idx) = PARAM_NAMES.iter().position(|&p| p == name) {
            params[idx] = Some(value.to_vec());
        }
    }

    let mut out: [Vec<u8>; 6] = Default::default();
    for (idx, param) in params.into_iter().enumerate() {
        out[idx] = param.ok_or(Error::UnexpectedData)?;
    }
    Ok(out)
}

fn emit(name: &str, keyid: (u32, u32), params: &[Vec<u8>; 6]) {
    println!("// Generated by {PGM}. Do not edit.");
    println!();
    println!("use tinypgp::{{KeyId, KeyRecord, Keystore}};");
    println!();
    for (pname, value) in PARAM_NAMES.iter().zip(params) {
        let pname = String::from_utf8_lossy(pname).to_uppercase();
        println!("const {name}_{pname}: &[u8] = &[");
        for chunk in value.chunks(12) {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("0x{b:02x}")).collect();
            println!("    {},", bytes.join(", "));
        }
        println!("];");
        println!();
    }
    println!("pub fn {}() -> Keystore {{", name.to_lowercase());
    println!("    Keystore::new(vec![KeyRecord::rsa(");
    println!(
        "        KeyId::from_halves(0x{:08x}, 0x{:08x}),",
        keyid.0, keyid.1
    );
    let names: Vec<String> = PARAM_NAMES
        .iter()
        .map(|p| format!("{name}_{}", String::from_utf8_lossy(p).to_uppercase()))
        .collect();
    println!("        {},", names.join(", "));
    println!("    )])");
    println!("}}");
}

fn main() {
    let mut keyid = None;
    let mut passphrase: Option<String> = None;
    let mut name = "KEYSTORE".to_string();
    let mut fname = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--keyid" => {
                let hex16 = args.next().unwrap_or_else(|| usage());
                if hex16.len() != 16 {
                    eprintln!("{PGM}: key id must be 16 hex digits");
                    exit(2);
                }
                let high = u32::from_str_radix(&hex16[..8], 16);
                let low = u32::from_str_radix(&hex16[8..], 16);
                match (high, low) {
                    (Ok(h), Ok(l)) => keyid = Some((h, l)),
                    _ => {
                        eprintln!("{PGM}: key id must be 16 hex digits");
                        exit(2);
                    }
                }
            }
            "--passphrase" => passphrase = Some(args.next().unwrap_or_else(|| usage())),
            "--name" => name = args.next().unwrap_or_else(|| usage()),
            "--help" => usage(),
            _ if fname.is_none() => fname = Some(arg),
            _ => usage(),
        }
    }
    let (Some(keyid), Some(fname)) = (keyid, fname) else {
        usage();
    };

    let raw = match read_input(&fname) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{PGM}: can't read `{fname}': {err}");
            exit(1);
        }
    };

    let result = (|| {
        let plain;
        let key: &[u8] = if protect::is_protected(&raw)? {
            let Some(pw) = &passphrase else {
                eprintln!("{PGM}: key is protected, --passphrase required");
                exit(1);
            };
            plain = protect::unprotect(&raw, pw.as_bytes())?;
            &plain
        } else {
            &raw
        };
        parse_private_key(key)
    })();

    match result {
        Ok(params) => emit(&name, keyid, &params),
        Err(err) => {
            eprintln!("{PGM}: {fname}: {err}");
            exit(1);
        }
    }
}
