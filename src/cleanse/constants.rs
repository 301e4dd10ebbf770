pub const DEFAULT_PARTITION_COUNT: usize = 6;
pub const DEFAULT_IO_BUFFER_SIZE_KB: usize = 64;
pub const DEFAULT_INPUT_DELIMITER: char = ';';
pub const DEFAULT_OUTPUT_DELIMITER: char = ',';

pub const MIN_PARTITION_COUNT: usize = 1;
pub const MAX_PARTITION_COUNT: usize = 10_000;
pub const MIN_IO_BUFFER_SIZE_KB: usize = 4;
pub const MAX_IO_BUFFER_SIZE_KB: usize = 65_536;

pub const BYTES_PER_KB: usize = 1024;

pub const DEFAULT_SOURCE_PATH: &str = "Lifebear.csv";
pub const DEFAULT_ORIGINALS_DIRECTORY: &str = "Chunks";
pub const DEFAULT_CLEANED_DIRECTORY: &str = "Cleaned_Chunks";
pub const DEFAULT_GARBAGE_DIRECTORY: &str = "Garbage";
pub const DEFAULT_MERGED_CLEANED_FILE: &str = "merged_cleaned.csv";
pub const DEFAULT_MERGED_GARBAGE_FILE: &str = "merged_garbage.csv";

pub const ORIGINAL_CHUNK_PREFIX: &str = "original_chunk_";
pub const CLEANED_CHUNK_PREFIX: &str = "cleaned_chunk_";
pub const GARBAGE_CHUNK_PREFIX: &str = "garbage_chunk_";
pub const CHUNK_FILE_EXTENSION: &str = ".csv";

pub const CSV_QUOTE_CHAR: u8 = b'"';

// Source column names
pub const COL_LOGIN_ID: &str = "login_id";
pub const COL_MAIL_ADDRESS: &str = "mail_address";
pub const COL_PASSWORD: &str = "password";
pub const COL_SALT: &str = "salt";
pub const COL_BIRTHDAY_ON: &str = "birthday_on";
pub const COL_GENDER: &str = "gender";

pub const REQUIRED_SOURCE_COLUMNS: [&str; 6] = [
    COL_LOGIN_ID,
    COL_MAIL_ADDRESS,
    COL_PASSWORD,
    COL_SALT,
    COL_BIRTHDAY_ON,
    COL_GENDER,
];

pub const CLEANED_COLUMNS: [&str; 6] = [
    "login",
    "email",
    "password",
    "salt",
    "date_of_birth",
    "gender",
];

/// Any cell containing this run marks the row as a broken upstream export.
pub const MALFORMED_ROW_MARKER: &str = ",,,,";

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z]{2,}$";

/// Cell values read as null, matching the NA tokens of common tabular exporters.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

pub const UTF8_BOM: char = '\u{feff}';

pub const DEFAULT_CONFIG_FILE: &str = "cleanse_config.json";
