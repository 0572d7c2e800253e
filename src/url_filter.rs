// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Static blacklist of fact-checking-site URLs
//!
//! Ingestion pipelines preparing transcript text call [`is_bad`] to exclude
//! links that would leak gold veracity information into the inputs. The
//! scoring engine itself never consults this.

/// Substring matchers tested against the lower-cased URL. Items within a row
/// must all match; the blacklist matches if any row does.
const MATCHERS_ALL: &[&[&str]] = &[
    // Fact-checking sites US
    &["factcheck.org"],
    &["politifact"],
    &["snopes"],
    &["truthorfiction"],
    &["climatefeedback"],
    &["gossipcop"],
    // Sites with fact-checking sections US
    &["apnews", "not-real-news"],
    &["apnews", "fact-check"],
    &["washingtonpost", "fact-check"],
    &["azcentral", "fact-check"],
    &["cbslocal", "reality-check"],
    &["thenevadaindependent", "fact-check"],
    &["thegazette", "fact-check"],
    &["thegazette", "factchecker"],
    &["nytimes", "fact-check"],
    &["bridgemi", "michigan-truth-squad"],
    &["channel3000", "reality-check"],
    &["kmov", "fact-check"],
    &["npr", "fact-check"],
    &["qctimes", "fact-check"],
    &["politico", "fact-check"],
    &["weeklystandard", "fact-check"],
    &["ballotpedia", "fact_check"],
    &["wral", "fact-check"],
    &["abcnews", "fact-check"],
    &["chicagotribune", "fact-check"],
    &["cnn", "fact-check"],
    &["theguardian", "fact-check"],
    &["usatoday", "fact-check"],
    // UK & other
    &["hoax-slayer"],
    &["fullfact"],
    &["factcheckni"],
    &["theconversation", "fact-check"],
    &["bbc", "realitycheck"],
    &["bbc", "reality-check"],
    &["channel4", "factcheck"],
    &["theferret", "fact-check"],
    &["theferret", "fact-service"],
    &["abc", "fact-check"],
    &["pbs", "fact-check"],
    &["foxnews", "fact-check"],
    // Possibly Arabic
    &["factnameh"],
    &["rouhanimeter"],
    &["thewhistle"],
    &["morsimeter"],
    &["larbitrefact"],
    &["meter.iwatch"],
    &["sebsimeter"],
    &["jomaameter"],
    &["essidmeter"],
    // Special phrases English
    &["debate-highlighted"],
    &["debate-transcript-annotated"],
    &["fact check"],
    &["fact%20check"],
    &["fact+check"],
    &["fact_check"],
    &["fact-check"],
    &["factcheck"],
    &["reality check"],
    &["reality%20check"],
    &["reality+check"],
    &["reality_check"],
    &["reality-check"],
    &["realitycheck"],
    &["fake news"],
    &["fake%20news"],
    &["fake+news"],
    &["fake_news"],
    &["fake-news"],
    &["fakenews"],
];

/// Reduced table used where only dedicated fact-checking sites matter
const MATCHERS_SIMPLE: &[&[&str]] = &[&["factcheck"]];

/// Returns true if the URL points at fact-checking content.
///
/// `strict` selects the full matcher table; `false` checks only for
/// dedicated fact-checking sites.
pub fn is_bad(url: &str, strict: bool) -> bool {
    let lower = url.to_lowercase();
    let matchers = if strict { MATCHERS_ALL } else { MATCHERS_SIMPLE };
    matchers
        .iter()
        .any(|row| row.iter().all(|item| lower.contains(item)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedicated_sites_are_bad_in_both_modes() {
        let url = "https://www.factcheck.org/2018/03/trump-veterans-choice-program/";
        assert!(is_bad(url, true));
        assert!(is_bad(url, false));

        let url = "https://www.channel4.com/news/factcheck/ann-coulters-10-misleading-claims";
        assert!(is_bad(url, true));
        assert!(is_bad(url, false));
    }

    #[test]
    fn test_section_urls_are_bad_only_in_strict_mode() {
        let urls = [
            "https://www.washingtonpost.com/news/fact-checker/wp/2018/02/18/fact-checking-trumps-tweet-storm/",
            "http://www.thegazette.com/subject/news/government/fact-check/fact-checking-the-speech",
            "https://twitter.com/snopes/status/963534404047048710",
        ];
        for url in urls {
            assert!(is_bad(url, true), "{} should be bad in strict mode", url);
            assert!(!is_bad(url, false), "{} should pass in simple mode", url);
        }
    }

    #[test]
    fn test_ordinary_urls_pass() {
        let urls = [
            "https://www.washingtonpost.com/news/tripping/wp/2017/11/30/car-rental-tolling/",
            "https://en.wikipedia.org/wiki/Donald_Trump",
        ];
        for url in urls {
            assert!(!is_bad(url, true));
            assert!(!is_bad(url, false));
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_bad("https://www.POLITIFACT.com/truth-o-meter/", true));
        assert!(is_bad("https://example.com/FactCheck/article", false));
    }

    #[test]
    fn test_row_items_must_all_match() {
        // "npr" alone is not enough without a fact-check path
        assert!(!is_bad("https://www.npr.org/sections/politics/", true));
        assert!(is_bad("https://www.npr.org/sections/politics-fact-check/", true));
    }
}
