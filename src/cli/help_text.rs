pub(super) const ROOT_LONG_ABOUT: &str = "\
Monitor parts of web pages for changes

Webwatch fetches each configured URL, extracts the text of all elements
matching a CSS selector, and fingerprints it with SHA-256. The fingerprint
is compared against the one stored from the previous run; a notification
email is sent when it differs, when a watch is seen for the first time, or
when something is wrong (fetch failure, selector matching nothing).
Unchanged content is logged and nothing is sent. Designed to be run from
cron.

CORE CONCEPTS:

  Watches:
    A watch is a labeled (url, selector) pair declared as a [[watch]]
    section in the configuration file. Labels must be unique; they key the
    persisted state.

  State file:
    A TOML file mapping each label to its last-seen fingerprint and check
    time. It is created on first use, rewritten atomically after each
    watch, and safe to inspect or delete (deleting it simply makes every
    watch look new again). No locking is performed; run one webwatch
    process at a time against a given state file.

  Notifications:
    Sent over plain SMTP to the configured relay. With mail disabled in
    the configuration, or with --no-mail, the would-be message is printed
    to stdout instead.

TYPICAL WORKFLOW:

  1. Write webwatch.toml:
     [[watch]]
     label = \"spiegel\"
     url = \"https://www.spiegel.de/\"
     selector = \"div.teaser\"

  2. Try it without sending mail:
     $ webwatch check --no-mail

  3. Add it to cron:
     */30 * * * * webwatch -C /etc/webwatch check

  4. Inspect what is stored:
     $ webwatch status

EXIT CODES:

  0    all watches checked, no anomalies (changes are not anomalies)
  1    at least one watch hit a fetch error, empty selector match, or
       mail delivery failure (on_error = \"continue\")
  2/3/4  stopped at the first fetch error / empty selector match / mail
       delivery failure (on_error = \"abort\")
  255  configuration or other errors
";

pub(super) const CHECK_LONG_ABOUT: &str = "\
Check configured watches and notify on changes or anomalies

Processes every [[watch]] from the configuration file strictly in order:
fetch, extract text under the selector, fingerprint, compare with the
stored fingerprint, notify, persist. Progress lines go to stdout;
diagnostics go to stderr.

A fetch error or an empty selector match leaves the stored fingerprint
untouched, so a transient outage does not mask a later real change.

With on_error = \"continue\" (the default) a failing watch does not stop
the remaining watches; the process exits 1 at the end if anything went
wrong. With on_error = \"abort\" the run stops at the first problem with a
distinct exit code.
";

pub(super) const STATUS_LONG_ABOUT: &str = "\
Show the persisted state store

Prints one line per label: the label, the stored SHA-256 fingerprint, and
the time of the check that recorded it. Reads the state file named by the
configuration; prints nothing if no state has been stored yet.
";
