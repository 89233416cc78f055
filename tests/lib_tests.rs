use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use hashtree::engine::{
    Cli, HashAlgorithm, OutputFormat, ResultSink, hash_reader, normalize_single_dash_flags,
    path_relative_to, path_to_slash_string, resolve_opts, task_rel_path,
};
use hashtree::pipeline::{AbortSignal, PipelineTuning};
use hashtree::utils::WorkerThreadLimits;
use hashtree::utils::hashtree_toml::{HashtreeToml, apply_file_to_opts};
use hashtree::{HashResult, Opts};
use std::ffi::OsString;
use std::path::PathBuf;

const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const SHA256_HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn digest_of(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 4096];
    hash_reader(algorithm, &mut &data[..], &mut buf).unwrap()
}

fn hex_of(algorithm: HashAlgorithm, data: &[u8]) -> String {
    hex::encode(digest_of(algorithm, data))
}

// --- digesters ---

#[test]
fn test_empty_input_digests() {
    let expected = [
        (HashAlgorithm::Crc32, "00000000"),
        (HashAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e"),
        (HashAlgorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
        (
            HashAlgorithm::Sha224,
            "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
        ),
        (HashAlgorithm::Sha256, SHA256_EMPTY),
        (
            HashAlgorithm::Sha512,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
        ),
    ];
    for (algorithm, hex) in expected {
        assert_eq!(hex_of(algorithm, b""), hex, "{algorithm}");
    }
}

#[test]
fn test_known_digests() {
    assert_eq!(hex_of(HashAlgorithm::Sha256, b"hello"), SHA256_HELLO);
    assert_eq!(
        hex_of(HashAlgorithm::Md5, b"hello"),
        "5d41402abc4b2a76b9719d911017c592"
    );
    assert_eq!(
        hex_of(HashAlgorithm::Sha1, b"hello"),
        "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
    );
    // CRC-32/IEEE check value, big-endian bytes.
    assert_eq!(hex_of(HashAlgorithm::Crc32, b"123456789"), "cbf43926");
}

#[test]
fn test_output_len_matches_digest() {
    for algorithm in HashAlgorithm::ALL {
        assert_eq!(
            digest_of(algorithm, b"abc").len(),
            algorithm.output_len(),
            "{algorithm}"
        );
    }
}

#[test]
fn test_chunk_size_does_not_change_digest() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    for algorithm in HashAlgorithm::ALL {
        let whole = digest_of(algorithm, &data);
        let mut tiny = vec![0u8; 7];
        let chunked = hash_reader(algorithm, &mut &data[..], &mut tiny).unwrap();
        assert_eq!(whole, chunked, "{algorithm}");
    }
}

#[test]
fn test_incremental_updates_match_one_shot() {
    let mut d = HashAlgorithm::Sha256.digester();
    d.update(b"he");
    d.update(b"");
    d.update(b"llo");
    assert_eq!(hex::encode(d.finalize()), SHA256_HELLO);
}

#[test]
fn test_sum_is_idempotent() {
    let mut d = HashAlgorithm::Md5.digester();
    d.update(b"hello");
    assert_eq!(d.sum(), d.sum());
    assert_eq!(d.sum(), d.finalize());
}

struct FailingReader {
    served: bool,
}

impl std::io::Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.served {
            return Err(std::io::Error::other("device gone"));
        }
        self.served = true;
        buf[0] = b'x';
        Ok(1)
    }
}

#[test]
fn test_read_error_mid_stream_is_returned() {
    let mut buf = vec![0u8; 16];
    let mut reader = FailingReader { served: false };
    let err = hash_reader(HashAlgorithm::Sha256, &mut reader, &mut buf).unwrap_err();
    assert_eq!(err.to_string(), "device gone");
}

#[test]
fn test_algorithm_names_parse() {
    for algorithm in HashAlgorithm::ALL {
        let parsed: HashAlgorithm = algorithm.name().parse().unwrap();
        assert_eq!(parsed, algorithm);
    }
    assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
}

#[test]
fn test_unknown_algorithm_rejected() {
    assert!("foo".parse::<HashAlgorithm>().is_err());
    assert!("SHA256".parse::<HashAlgorithm>().is_err());
    assert!("".parse::<HashAlgorithm>().is_err());
}

// --- output formats ---

fn render(format: OutputFormat, path: &str, digest: &[u8]) -> String {
    let mut sink = ResultSink::new(format, Vec::new());
    sink.print(&HashResult {
        path: path.to_string(),
        digest: digest.to_vec(),
    })
    .unwrap();
    String::from_utf8(sink.into_inner().unwrap()).unwrap()
}

#[test]
fn test_format_names_parse() {
    assert_eq!("hex".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
    assert_eq!("base64".parse::<OutputFormat>().unwrap(), OutputFormat::Base64);
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::JsonHex);
    assert_eq!("json-hex".parse::<OutputFormat>().unwrap(), OutputFormat::JsonHex);
    assert_eq!(
        "json-base64".parse::<OutputFormat>().unwrap(),
        OutputFormat::JsonBase64
    );
    assert!("text".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::default(), OutputFormat::Hex);
}

#[test]
fn test_hex_line() {
    let digest = digest_of(HashAlgorithm::Sha256, b"");
    assert_eq!(
        render(OutputFormat::Hex, "a.txt", &digest),
        format!("{SHA256_EMPTY}  a.txt\n")
    );
}

#[test]
fn test_base64_line() {
    let digest = digest_of(HashAlgorithm::Sha256, b"");
    assert_eq!(
        render(OutputFormat::Base64, "dir/a.txt", &digest),
        "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=  dir/a.txt\n"
    );
}

#[test]
fn test_json_hex_line() {
    let digest = digest_of(HashAlgorithm::Sha256, b"");
    assert_eq!(
        render(OutputFormat::JsonHex, "a.txt", &digest),
        format!("{{\"path\":\"a.txt\",\"hash\":\"{SHA256_EMPTY}\"}}\n")
    );
}

#[test]
fn test_json_escapes_path() {
    let line = render(OutputFormat::JsonBase64, "we\"ird\\name", &[0xff]);
    let v: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(v["path"], "we\"ird\\name");
    assert_eq!(v["hash"], "/w==");
}

#[test]
fn test_json_hex_field_round_trips() {
    let digest = digest_of(HashAlgorithm::Sha1, b"hello");
    let line = render(OutputFormat::JsonHex, "b.txt", &digest);
    let v: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    let field = v["hash"].as_str().unwrap();
    assert_eq!(hex::encode(hex::decode(field).unwrap()), field);
}

#[test]
fn test_hex_and_base64_decode_to_same_bytes() {
    let digest = digest_of(HashAlgorithm::Sha512, b"hello");
    let hex_line = render(OutputFormat::Hex, "f", &digest);
    let b64_line = render(OutputFormat::Base64, "f", &digest);
    let (hex_field, _) = hex_line.split_once("  ").unwrap();
    let (b64_field, _) = b64_line.split_once("  ").unwrap();
    assert_eq!(
        hex::decode(hex_field).unwrap(),
        STANDARD.decode(b64_field).unwrap()
    );
}

// --- path helpers ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux");
    assert_eq!(path_relative_to(&path, &base), None);
}

#[test]
fn test_slash_string() {
    assert_eq!(path_to_slash_string(&PathBuf::from("src/main.rs")), "src/main.rs");
    assert_eq!(path_to_slash_string(&PathBuf::from("")), ".");
    assert_eq!(path_to_slash_string(&PathBuf::from("./a/b")), "a/b");
}

#[test]
fn test_task_rel_path_of_root_is_dot() {
    let root = PathBuf::from("/data/file.bin");
    assert_eq!(task_rel_path(&root, &root), ".");
    assert_eq!(
        task_rel_path(&PathBuf::from("/data/x/y"), &PathBuf::from("/data")),
        "x/y"
    );
}

// --- CLI parsing ---

fn args(list: &[&str]) -> Vec<OsString> {
    list.iter().map(OsString::from).collect()
}

#[test]
fn test_single_dash_long_flags_normalized() {
    let got = normalize_single_dash_flags(args(&[
        "hashtree", "-hash", "md5", "-fmt=json", "-jobs", "4", "-v", "dir",
    ]));
    assert_eq!(
        got,
        args(&["hashtree", "--hash", "md5", "--fmt=json", "--jobs", "4", "-v", "dir"])
    );
}

#[test]
fn test_normalize_leaves_unknown_and_separated_args() {
    let got = normalize_single_dash_flags(args(&["hashtree", "-nothing", "--", "-hash"]));
    assert_eq!(got, args(&["hashtree", "-nothing", "--", "-hash"]));
}

#[test]
fn test_cli_requires_roots() {
    let err = Cli::try_parse_from(["hashtree"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_resolve_opts_defaults() {
    let cli = Cli::parse_from(["hashtree", "a", "b"]);
    let opts = resolve_opts(&cli, None).unwrap();
    assert_eq!(opts.roots, vec![PathBuf::from("a"), PathBuf::from("b")]);
    assert_eq!(opts.algorithm, HashAlgorithm::Sha256);
    assert_eq!(opts.format, OutputFormat::Hex);
    assert_eq!(opts.num_threads, None);
    assert!(!opts.follow_links);
}

#[test]
fn test_resolve_opts_from_go_style_flags() {
    let cli = Cli::parse_from(normalize_single_dash_flags(args(&[
        "hashtree", "-hash", "crc32", "-fmt", "json-base64", "-jobs", "3", "root",
    ])));
    let opts = resolve_opts(&cli, None).unwrap();
    assert_eq!(opts.algorithm, HashAlgorithm::Crc32);
    assert_eq!(opts.format, OutputFormat::JsonBase64);
    assert_eq!(opts.num_threads, Some(3));
}

#[test]
fn test_resolve_opts_rejects_unknown_hash() {
    let cli = Cli::parse_from(["hashtree", "--hash", "foo", "root"]);
    assert!(resolve_opts(&cli, None).is_err());
}

#[test]
fn test_config_file_then_flags() {
    let file = HashtreeToml::parse(
        "[settings]\nhash = \"md5\"\nfmt = \"base64\"\njobs = 2\nfollow_links = true\n",
    )
    .unwrap();
    let cli = Cli::parse_from(["hashtree", "--fmt", "json", "root"]);
    let opts = resolve_opts(&cli, Some(&file)).unwrap();
    assert_eq!(opts.algorithm, HashAlgorithm::Md5);
    assert_eq!(opts.format, OutputFormat::JsonHex);
    assert_eq!(opts.num_threads, Some(2));
    assert!(opts.follow_links);
}

#[test]
fn test_config_file_rejects_unknown_format() {
    let file = HashtreeToml::parse("[settings]\nfmt = \"xml\"\n").unwrap();
    let mut opts = Opts::default();
    assert!(apply_file_to_opts(&file, &mut opts).is_err());
}

#[test]
fn test_config_file_malformed() {
    assert!(HashtreeToml::parse("[settings]\njobs = \"many\"\n").is_err());
    assert!(HashtreeToml::parse("").is_ok());
}

// --- tuning / abort ---

#[test]
fn test_jobs_zero_means_all_threads() {
    let limits = WorkerThreadLimits {
        all_threads: 6,
        ..Default::default()
    };
    assert_eq!(limits.resolve(None), 6);
    assert_eq!(limits.resolve(Some(0)), 6);
    assert_eq!(limits.resolve(Some(3)), 3);
}

#[test]
fn test_channel_cap_scales_with_workers() {
    assert_eq!(PipelineTuning::for_threads(4).channel_cap, 8);
    assert_eq!(PipelineTuning::for_threads(1).channel_cap, 2);
    assert_eq!(PipelineTuning::for_threads(0).num_threads, 1);
}

#[test]
fn test_abort_keeps_first_error() {
    let abort = AbortSignal::new();
    assert!(!abort.is_raised());
    assert!(abort.check().is_ok());
    let shared = abort.clone();
    shared.raise(anyhow::anyhow!("first"));
    abort.raise(anyhow::anyhow!("second"));
    assert!(abort.is_raised());
    assert_eq!(abort.check().unwrap_err().to_string(), "first");
}

#[test]
fn test_setup_logging_twice_is_noop() {
    hashtree::utils::setup_logging(true);
    hashtree::utils::setup_logging(false);
    log::info!("logger installed");
}
