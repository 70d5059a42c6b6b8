//! Curated Common Crawl index-sets, newest first.

pub(super) struct StaticEntry {
    pub year: i32,
    pub month: u32,
    pub index_set: &'static str,
}

pub(super) const ENTRIES: &[StaticEntry] = &[
    StaticEntry { year: 2018, month: 5, index_set: "CC-MAIN-2018-22" },
    StaticEntry { year: 2018, month: 4, index_set: "CC-MAIN-2018-17" },
    StaticEntry { year: 2018, month: 3, index_set: "CC-MAIN-2018-13" },
    StaticEntry { year: 2018, month: 2, index_set: "CC-MAIN-2018-09" },
    StaticEntry { year: 2018, month: 1, index_set: "CC-MAIN-2018-05" },
    StaticEntry { year: 2017, month: 12, index_set: "CC-MAIN-2017-51" },
    StaticEntry { year: 2017, month: 11, index_set: "CC-MAIN-2017-47" },
    StaticEntry { year: 2017, month: 10, index_set: "CC-MAIN-2017-43" },
    StaticEntry { year: 2017, month: 9, index_set: "CC-MAIN-2017-39" },
    StaticEntry { year: 2017, month: 8, index_set: "CC-MAIN-2017-34" },
    StaticEntry { year: 2017, month: 7, index_set: "CC-MAIN-2017-30" },
    StaticEntry { year: 2017, month: 6, index_set: "CC-MAIN-2017-26" },
    StaticEntry { year: 2017, month: 5, index_set: "CC-MAIN-2017-22" },
    StaticEntry { year: 2017, month: 4, index_set: "CC-MAIN-2017-17" },
    StaticEntry { year: 2017, month: 3, index_set: "CC-MAIN-2017-13" },
    StaticEntry { year: 2017, month: 2, index_set: "CC-MAIN-2017-09" },
    StaticEntry { year: 2017, month: 1, index_set: "CC-MAIN-2017-04" },
    StaticEntry { year: 2016, month: 12, index_set: "CC-MAIN-2016-50" },
    StaticEntry { year: 2016, month: 10, index_set: "CC-MAIN-2016-44" },
    StaticEntry { year: 2016, month: 9, index_set: "CC-MAIN-2016-40" },
    StaticEntry { year: 2016, month: 8, index_set: "CC-MAIN-2016-36" },
    StaticEntry { year: 2016, month: 7, index_set: "CC-MAIN-2016-30" },
    StaticEntry { year: 2016, month: 6, index_set: "CC-MAIN-2016-26" },
    StaticEntry { year: 2016, month: 5, index_set: "CC-MAIN-2016-22" },
    StaticEntry { year: 2016, month: 4, index_set: "CC-MAIN-2016-18" },
    StaticEntry { year: 2016, month: 2, index_set: "CC-MAIN-2016-07" },
    StaticEntry { year: 2015, month: 11, index_set: "CC-MAIN-2015-48" },
    StaticEntry { year: 2015, month: 9, index_set: "CC-MAIN-2015-40" },
    StaticEntry { year: 2015, month: 8, index_set: "CC-MAIN-2015-35" },
    StaticEntry { year: 2015, month: 7, index_set: "CC-MAIN-2015-32" },
    StaticEntry { year: 2015, month: 6, index_set: "CC-MAIN-2015-27" },
    StaticEntry { year: 2015, month: 5, index_set: "CC-MAIN-2015-22" },
    StaticEntry { year: 2015, month: 4, index_set: "CC-MAIN-2015-18" },
    StaticEntry { year: 2015, month: 3, index_set: "CC-MAIN-2015-14" },
    StaticEntry { year: 2015, month: 2, index_set: "CC-MAIN-2015-11" },
    StaticEntry { year: 2015, month: 1, index_set: "CC-MAIN-2015-06" },
    StaticEntry { year: 2014, month: 12, index_set: "CC-MAIN-2014-52" },
    StaticEntry { year: 2014, month: 11, index_set: "CC-MAIN-2014-49" },
    StaticEntry { year: 2014, month: 10, index_set: "CC-MAIN-2014-42" },
    StaticEntry { year: 2014, month: 9, index_set: "CC-MAIN-2014-41" },
    StaticEntry { year: 2014, month: 8, index_set: "CC-MAIN-2014-35" },
    StaticEntry { year: 2014, month: 7, index_set: "CC-MAIN-2014-23" },
    StaticEntry { year: 2014, month: 4, index_set: "CC-MAIN-2014-15" },
    StaticEntry { year: 2014, month: 3, index_set: "CC-MAIN-2014-10" },
    StaticEntry { year: 2014, month: 2, index_set: "CC-MAIN-2013-48" },
    StaticEntry { year: 2013, month: 9, index_set: "CC-MAIN-2013-20" },
];
