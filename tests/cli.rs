use std::ffi::OsString;

use wrapper::cli::{
    BinaryAction, Command, Invocation, ProfileCommand, invoked_name, parse_binary_args,
    parse_invocation, split_binary,
};

fn argv(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

fn profile_command(action: BinaryAction) -> Option<ProfileCommand> {
    match action {
        BinaryAction::Profile(profile) => profile.command,
        BinaryAction::Execute(args) => panic!("expected profile command, got {args:?}"),
    }
}

#[test]
fn invoked_name_is_the_file_name() {
    assert_eq!(
        invoked_name("/usr/local/bin/wrapper".as_ref()).as_deref(),
        Some("wrapper")
    );
    assert_eq!(invoked_name("vault".as_ref()).as_deref(), Some("vault"));
    assert_eq!(
        invoked_name("/usr/local/bin/python3.12".as_ref()).as_deref(),
        Some("python3.12")
    );
}

#[cfg(windows)]
#[test]
fn invoked_name_drops_the_exe_suffix() {
    assert_eq!(invoked_name("C:\\tools\\aws.exe".as_ref()).as_deref(), Some("aws"));
}

#[test]
fn dotted_symlink_name_is_the_whole_binary_name() {
    let invocation = parse_invocation(argv(&["/usr/local/bin/python3.12", "-V"]))
        .expect("cli parse should work");
    match invocation {
        Invocation::Binary {
            binary,
            action: BinaryAction::Execute(args),
        } => {
            assert_eq!(binary, "python3.12");
            assert_eq!(args, ["-V"]);
        }
        other => panic!("expected pass-through, got {other:?}"),
    }
}

#[test]
fn parses_top_level_list() {
    let invocation = parse_invocation(argv(&["wrapper", "list"])).expect("cli parse should work");
    match invocation {
        Invocation::Wrapper(cli) => assert!(matches!(cli.command, Command::List)),
        _ => panic!("expected wrapper command"),
    }
}

#[test]
fn binary_name_after_wrapper_is_external() {
    let invocation = parse_invocation(argv(&["wrapper", "-v", "vault", "status", "--help"]))
        .expect("cli parse should work");
    let Invocation::Wrapper(cli) = invocation else {
        panic!("expected wrapper command");
    };
    assert_eq!(cli.verbose, 1);
    let Command::Binary(raw) = cli.command else {
        panic!("expected binary invocation");
    };

    let (binary, args) = split_binary(raw).expect("binary name");
    assert_eq!(binary, "vault");
    assert_eq!(args, ["status", "--help"]);
}

#[test]
fn symlinked_name_is_the_binary() {
    let invocation = parse_invocation(argv(&["/home/dev/bin/vault", "kv", "get", "secret/x"]))
        .expect("cli parse should work");
    match invocation {
        Invocation::Binary {
            binary,
            action: BinaryAction::Execute(args),
        } => {
            assert_eq!(binary, "vault");
            assert_eq!(args, ["kv", "get", "secret/x"]);
        }
        other => panic!("expected pass-through, got {other:?}"),
    }
}

#[test]
fn symlinked_name_routes_profile_commands() {
    let invocation =
        parse_invocation(argv(&["vault", "profile", "set", "prod"])).expect("cli parse should work");
    let Invocation::Binary { binary, action } = invocation else {
        panic!("expected binary invocation");
    };
    assert_eq!(binary, "vault");
    match profile_command(action) {
        Some(ProfileCommand::Set(args)) => assert_eq!(args.name, "prod"),
        other => panic!("expected set, got {other:?}"),
    }
}

#[test]
fn bare_profile_defaults_to_listing() {
    let action = parse_binary_args("vault", argv(&["profile"])).expect("cli parse should work");
    assert!(profile_command(action).is_none());
}

#[test]
fn parses_every_profile_subcommand() {
    let parse = |args: &[&str]| {
        let action = parse_binary_args("vault", argv(args)).expect("cli parse should work");
        profile_command(action).expect("subcommand")
    };

    assert!(matches!(parse(&["profile", "list"]), ProfileCommand::List));
    assert!(matches!(
        parse(&["profile", "get"]),
        ProfileCommand::Get(args) if !args.default && !args.active
    ));
    assert!(matches!(
        parse(&["profile", "get", "--default"]),
        ProfileCommand::Get(args) if args.default
    ));
    assert!(matches!(
        parse(&["profile", "get", "--active"]),
        ProfileCommand::Get(args) if args.active
    ));
    assert!(matches!(
        parse(&["profile", "create", "prod"]),
        ProfileCommand::Create(args) if args.name == "prod"
    ));
    assert!(matches!(
        parse(&["profile", "set", "prod"]),
        ProfileCommand::Set(args) if args.name == "prod"
    ));
    assert!(matches!(
        parse(&["profile", "default", "prod"]),
        ProfileCommand::Default(args) if args.name == "prod"
    ));
    assert!(matches!(
        parse(&["profile", "delete", "prod"]),
        ProfileCommand::Delete(args) if args.name == "prod"
    ));
}

#[test]
fn profile_flags_are_parsed() {
    let action = parse_binary_args("vault", argv(&["profile", "list", "--json", "-vv"]))
        .expect("cli parse should work");
    let BinaryAction::Profile(profile) = action else {
        panic!("expected profile command");
    };
    assert!(profile.json);
    assert_eq!(profile.verbose, 2);
}

#[test]
fn get_selectors_are_exclusive() {
    assert!(parse_binary_args("vault", argv(&["profile", "get", "--default", "--active"])).is_err());
}

#[test]
fn create_requires_a_name() {
    assert!(parse_binary_args("vault", argv(&["profile", "create"])).is_err());
}

#[test]
fn double_dash_passes_profile_through() {
    let action =
        parse_binary_args("vault", argv(&["--", "profile", "x"])).expect("cli parse should work");
    match action {
        BinaryAction::Execute(args) => assert_eq!(args, ["profile", "x"]),
        BinaryAction::Profile(_) => panic!("expected pass-through"),
    }
}

#[test]
fn other_arguments_pass_through_untouched() {
    let action = parse_binary_args("vault", argv(&["status", "-format=json", "--", "x"]))
        .expect("cli parse should work");
    match action {
        BinaryAction::Execute(args) => assert_eq!(args, ["status", "-format=json", "--", "x"]),
        BinaryAction::Profile(_) => panic!("expected pass-through"),
    }
}

#[test]
fn empty_arguments_run_the_binary() {
    let action = parse_binary_args("vault", Vec::new()).expect("cli parse should work");
    assert!(matches!(action, BinaryAction::Execute(args) if args.is_empty()));
}
