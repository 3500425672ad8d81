//! Compiled patterns shared across the field strategies.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number: two uppercase letters followed by eight digits.
    pub static ref INVOICE_NUMBER_STRICT: Regex = Regex::new(
        r"[A-Z]{2}\d{8}"
    ).unwrap();

    // Loose form tolerating a stray separator after the letter prefix.
    pub static ref INVOICE_NUMBER_LOOSE: Regex = Regex::new(
        r"[A-Z]{1,2}[-\s]?\d{6,8}"
    ).unwrap();

    // Keyword-anchored invoice number forms, in priority order.
    pub static ref INVOICE_NUMBER_KEYWORD: Vec<Regex> = vec![
        Regex::new(r"發票號碼[：:]\s*([A-Z0-9]{8})").unwrap(),
        Regex::new(r"統一發票\s*([A-Z0-9]{8})").unwrap(),
        Regex::new(r"發票編號[：:]\s*([A-Z0-9]{8})").unwrap(),
        Regex::new(r"NO[.:]\s*([A-Z0-9]{8})").unwrap(),
        Regex::new(r"發票號碼\s*[:：]?\s*([A-Z0-9]{2,3}[-—]\s*[A-Z0-9]{8})").unwrap(),
    ];

    // Labeled seller tax id forms, in priority order.
    pub static ref TAX_ID_KEYWORD: Vec<Regex> = vec![
        Regex::new(r"統一編號[：:]\s*(\d{8})").unwrap(),
        Regex::new(r"統編[：:]\s*(\d{8})").unwrap(),
        Regex::new(r"NO[.:]\s*(\d{8})").unwrap(),
        Regex::new(r"賣方[：:]\s*(\d{8})").unwrap(),
        Regex::new(r"商店編號[：:]\s*(\d{8})").unwrap(),
        Regex::new(r"商號編號[：:]\s*(\d{8})").unwrap(),
        Regex::new(r"營利事業統一編號[：:]\s*(\d{8})").unwrap(),
    ];

    // Bare eight-digit run.
    pub static ref TAX_ID_STANDALONE: Regex = Regex::new(
        r"\b(\d{8})\b"
    ).unwrap();

    // Date forms with a full Gregorian year.
    pub static ref DATE_WESTERN: Regex = Regex::new(
        r"(\d{4})[-/\.](\d{1,2})[-/\.](\d{1,2})"
    ).unwrap();

    pub static ref DATE_WESTERN_GLYPH: Regex = Regex::new(
        r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*[日號]?"
    ).unwrap();

    // Ambiguous numeric triplet (minguo or Gregorian, several readings).
    pub static ref DATE_TRIPLET: Regex = Regex::new(
        r"(\d{1,3})[/\-](\d{1,2})[/\-](\d{1,2})"
    ).unwrap();

    // Bimonthly period-range signature, used to reject non-dates.
    pub static ref PERIOD_RANGE: Regex = Regex::new(
        r"\d{1,2}[-~]\d{1,2}月"
    ).unwrap();

    // Filing-period forms.
    pub static ref PERIOD_MINGUO: Regex = Regex::new(
        r"(?:中華民國|民國)\s*(\d{3})\s*年\s*(\d{1,2})[-~]\d{1,2}月份?"
    ).unwrap();

    pub static ref PERIOD_CN_NUMERAL: Regex = Regex::new(
        r"([一二三四五六七八九十]{2,3})年\s*([一二三四五六七八九十]{1,2})、\s*([一二三四五六七八九十]{1,2})月"
    ).unwrap();

    pub static ref PERIOD_BARE: Regex = Regex::new(
        r"(\d{1,2})[-~](\d{1,2})月"
    ).unwrap();

    pub static ref PERIOD_SINGLE_MONTH: Regex = Regex::new(
        r"(\d{1,2})月\s*份"
    ).unwrap();

    // Time forms, in priority order.
    pub static ref TIME_LABELED: Regex = Regex::new(
        r"時間[：:]\s*(\d{1,2}):(\d{2})"
    ).unwrap();

    pub static ref TIME_LABELED_EN: Regex = Regex::new(
        r"Time[：:]\s*(\d{1,2}):(\d{2})"
    ).unwrap();

    pub static ref TIME_HMS: Regex = Regex::new(
        r"(\d{1,2}):(\d{2}):\d{2}"
    ).unwrap();

    pub static ref TIME_GLYPH: Regex = Regex::new(
        r"(\d{1,2})時(\d{1,2})分"
    ).unwrap();

    pub static ref TIME_AMPM: Regex = Regex::new(
        r"(\d{1,2})[:.](\d{2})\s*(AM|PM|am|pm)?"
    ).unwrap();

    // Address forms; the last one keys on Taiwanese city/county prefixes and
    // captures via the whole match.
    pub static ref ADDRESS_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"地址[:：]?[ \t]*(.+?)(?:電話|傳真|統一編號|\n|$)").unwrap(),
        Regex::new(r"Address[:：]?[ \t]*(.+?)(?:Tel|Fax|\n|$)").unwrap(),
        Regex::new(r"(?:台|臺|新|桃|苗|彰|南|高|屏|宜|花|東)[^縣市]{0,3}[縣市].{5,30}").unwrap(),
    ];

    // Buyer forms.
    pub static ref BUYER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"買受人[:：]?[ \t]*(.+?)(?:地址|電話|\n|$)").unwrap(),
        Regex::new(r"Customer[:：]?[ \t]*(.+?)(?:Address|Tel|\n|$)").unwrap(),
        Regex::new(r"公司名稱[:：]?[ \t]*(.+?)(?:地址|電話|\n|$)").unwrap(),
    ];

    // Presence of a labeled tax amount, fallback signal for the tax category.
    pub static ref TAX_AMOUNT: Regex = Regex::new(
        r"稅額[:：]?\s*NT?\$?\s*[\d,]+\.?\d*"
    ).unwrap();

    // Line-item fallback rows: name followed by numeric columns.
    pub static ref ITEM_ROW_4: Regex = Regex::new(
        r"(\S+)\s+(\d+\.?\d*)\s+(\d+\.?\d*)\s+(\d+\.?\d*)"
    ).unwrap();

    pub static ref ITEM_ROW_3: Regex = Regex::new(
        r"(\S+)\s+(\d+\.?\d*)\s+(\d+\.?\d*)"
    ).unwrap();

    // Table columns are separated by runs of two or more spaces.
    pub static ref COLUMN_SPLIT: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();
}
