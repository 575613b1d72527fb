use std::{collections::BTreeMap, sync::Arc};

use futures::executor::block_on;
use shardex::{
    config::{SortOrder, TruncateProfile, TruncateSettings},
    directory::{Directory, FsDirectory, RamDirectory},
    index::{
        DictKeyInfo, InvertedIndexReader, MultiShardInvertedIndexReader,
        MultiShardInvertedIndexSegmentUpdater, ShardingIndexHasher, TruncatedIndexReader,
    },
    postings::{PostingIterator, VecPostingIterator},
    query::Term,
    schema::{IndexConfig, IndexType},
    truncate::{
        AttributeScorer, DocScorer, MultiTruncateIndexWriter, SingleTruncateIndexWriter,
        TermFreqScorer, TruncateIndexWriter, TruncateTriggerInfo,
    },
    DocId, TermFreq, END_DOCID,
};

const DOC_COUNT: DocId = 600;
const SHARD_COUNT: usize = 3;

type Postings = Vec<(DocId, TermFreq)>;

fn get_all_docs(posting_iter: Option<Box<dyn PostingIterator>>) -> Vec<DocId> {
    let mut docids = vec![];
    if let Some(mut posting_iter) = posting_iter {
        let mut docid = 0;
        loop {
            docid = posting_iter.seek(docid).unwrap();
            if docid != END_DOCID {
                docids.push(docid);
                docid += 1;
            } else {
                break;
            }
        }
    }
    docids
}

fn price(docid: DocId) -> i64 {
    ((docid as i64) * 37) % 101
}

/// Words of every document with their term frequency, `None` for a document
/// without title.
fn doc_words(docid: DocId) -> Option<Vec<(String, TermFreq)>> {
    if docid % 50 == 0 {
        return None;
    }
    let mut words = vec![
        ("common".to_string(), (docid % 7) as TermFreq + 1),
        (format!("w{}", docid % 10), 1),
    ];
    if docid % 2 == 0 {
        words.push(("even".to_string(), (docid % 3) as TermFreq + 1));
    }
    if docid == 5 || docid == 17 {
        words.push(("rare".to_string(), 2));
    }
    Some(words)
}

fn all_words() -> Vec<Term> {
    let mut terms: Vec<_> = ["common", "even", "rare", "missing"]
        .iter()
        .map(|word| Term::new("title", *word))
        .collect();
    terms.extend((0..10).map(|i| Term::new("title", format!("w{}", i))));
    terms.push(Term::null("title"));
    terms
}

fn build_postings(hasher: &ShardingIndexHasher) -> Vec<BTreeMap<DictKeyInfo, Postings>> {
    let mut shards = vec![BTreeMap::<DictKeyInfo, Postings>::new(); hasher.shard_count()];
    for docid in 0..DOC_COUNT {
        let terms = match doc_words(docid) {
            Some(words) => words
                .into_iter()
                .map(|(word, tf)| (Term::new("title", word), tf))
                .collect(),
            None => vec![(Term::null("title"), 1)],
        };
        for (term, tf) in terms {
            let (key, shard_idx) = hasher.get_sharding_idx(&term).unwrap();
            shards[shard_idx].entry(key).or_default().push((docid, tf));
        }
    }
    shards
}

fn expected_postings(term: &Term) -> Postings {
    (0..DOC_COUNT)
        .filter_map(|docid| {
            let tf = match (doc_words(docid), term.word()) {
                (None, None) => 1,
                (Some(words), Some(word)) => words
                    .into_iter()
                    .find(|(w, _)| w == word)
                    .map(|(_, tf)| tf)?,
                _ => return None,
            };
            Some((docid, tf))
        })
        .collect()
}

fn expected_top_docs(
    term: &Term,
    scorer: &dyn DocScorer,
    profile: &TruncateProfile,
) -> Vec<DocId> {
    let postings = expected_postings(term);
    if (postings.len() as i64) < profile.df_threshold() {
        return vec![];
    }
    let mut ranked: Vec<_> = postings
        .iter()
        .map(|&(docid, tf)| (scorer.score(docid, tf), docid))
        .collect();
    ranked.sort_by(|a, b| match profile.sort_order() {
        SortOrder::Descending => b.0.cmp(&a.0).then(a.1.cmp(&b.1)),
        SortOrder::Ascending => a.0.cmp(&b.0).then(a.1.cmp(&b.1)),
    });
    let mut docids: Vec<_> = ranked
        .into_iter()
        .take(profile.limit())
        .map(|(_, docid)| docid)
        .collect();
    docids.sort();
    docids
}

fn profiles() -> Vec<(TruncateProfile, Arc<dyn DocScorer>)> {
    let prices = (0..DOC_COUNT).map(price).collect();
    vec![
        (
            TruncateProfile::builder("tf")
                .with_df_threshold(3)
                .with_limit(5)
                .build(),
            Arc::new(TermFreqScorer) as Arc<dyn DocScorer>,
        ),
        (
            TruncateProfile::builder("cheap")
                .with_df_threshold(100)
                .with_limit(20)
                .with_sort_order(SortOrder::Ascending)
                .build(),
            Arc::new(AttributeScorer::new(prices)) as Arc<dyn DocScorer>,
        ),
    ]
}

fn truncate_shards(
    directory: Arc<dyn Directory>,
    hasher: &ShardingIndexHasher,
    settings: &TruncateSettings,
) {
    for (shard_idx, postings) in build_postings(hasher).into_iter().enumerate() {
        let output_name = MultiShardInvertedIndexSegmentUpdater::shard_file_name("title", shard_idx);
        let mut writer = MultiTruncateIndexWriter::with_settings(settings).unwrap();
        for (profile, scorer) in profiles() {
            let single =
                SingleTruncateIndexWriter::new(directory.clone(), &output_name, profile, scorer)
                    .unwrap();
            writer.add_index_writer(Box::new(single));
        }
        for (key, postings) in postings {
            let df = postings.len() as i64;
            if !writer.need_truncate(&TruncateTriggerInfo::new(key, df)) {
                continue;
            }
            writer
                .add_posting(key, Box::new(VecPostingIterator::new(postings)), df)
                .unwrap();
        }
        writer.end_posting().unwrap();
        assert_eq!(writer.internal_writer_count(), 0);
    }
}

fn open_reader(
    directory: &dyn Directory,
    hasher: &Arc<ShardingIndexHasher>,
    profile_name: &str,
) -> MultiShardInvertedIndexReader {
    let shard_readers = (0..hasher.shard_count())
        .map(|shard_idx| {
            let output_name =
                MultiShardInvertedIndexSegmentUpdater::shard_file_name("title", shard_idx);
            let reader = TruncatedIndexReader::open(
                directory,
                &output_name,
                profile_name,
                hasher.dict_hasher().clone(),
            )
            .unwrap();
            Arc::new(reader) as Arc<dyn InvertedIndexReader>
        })
        .collect();
    MultiShardInvertedIndexReader::new(hasher.clone(), shard_readers).unwrap()
}

fn sharded_hasher() -> Arc<ShardingIndexHasher> {
    let index_config = IndexConfig::builder("title", IndexType::Text)
        .with_shard_count(SHARD_COUNT)
        .build();
    Arc::new(ShardingIndexHasher::new(&index_config))
}

fn check_profiles(directory: &dyn Directory, hasher: &Arc<ShardingIndexHasher>) {
    for (profile, scorer) in profiles() {
        let reader = open_reader(directory, hasher, profile.name());
        for term in all_words() {
            let expected = expected_top_docs(&term, scorer.as_ref(), &profile);
            assert_eq!(
                get_all_docs(reader.lookup(&term).unwrap()),
                expected,
                "profile `{}` term {:?}",
                profile.name(),
                term
            );
            assert_eq!(
                get_all_docs(block_on(reader.lookup_async(&term)).unwrap()),
                expected
            );
        }
    }
}

#[test]
fn test_truncate_single_thread() {
    let directory: Arc<dyn Directory> = Arc::new(RamDirectory::new());
    let hasher = sharded_hasher();
    let settings = TruncateSettings::builder().with_thread_count(1).build();
    truncate_shards(directory.clone(), &hasher, &settings);
    check_profiles(directory.as_ref(), &hasher);
}

#[test]
fn test_truncate_multi_thread() {
    let directory: Arc<dyn Directory> = Arc::new(RamDirectory::new());
    let hasher = sharded_hasher();
    let settings = TruncateSettings::builder().with_thread_count(4).build();
    truncate_shards(directory.clone(), &hasher, &settings);
    check_profiles(directory.as_ref(), &hasher);
}

#[test]
fn test_truncate_to_fs_directory() {
    let tempdir = tempfile::tempdir().unwrap();
    let directory: Arc<dyn Directory> = Arc::new(FsDirectory::open(tempdir.path()).unwrap());
    let hasher = sharded_hasher();
    let settings = TruncateSettings::builder().with_thread_count(2).build();
    truncate_shards(directory.clone(), &hasher, &settings);
    check_profiles(directory.as_ref(), &hasher);

    let reader = open_reader(directory.as_ref(), &hasher, "tf");
    let ranges = [0..300, 400..450];
    let docids = get_all_docs(
        block_on(reader.partial_lookup_async(&Term::new("title", "common"), &ranges)).unwrap(),
    );
    let all = expected_top_docs(&Term::new("title", "common"), &TermFreqScorer, &profiles()[0].0);
    let expected: Vec<_> = all
        .into_iter()
        .filter(|docid| ranges.iter().any(|range| range.contains(docid)))
        .collect();
    assert_eq!(docids, expected);
}

#[test]
fn test_lookup_other_index_fails() {
    let directory: Arc<dyn Directory> = Arc::new(RamDirectory::new());
    let hasher = sharded_hasher();
    truncate_shards(directory.clone(), &hasher, &TruncateSettings::default());
    let reader = open_reader(directory.as_ref(), &hasher, "tf");
    assert!(reader.lookup(&Term::new("body", "common")).is_err());
    assert!(reader
        .segment_postings(&Term::new("body", "common"))
        .is_err());
    let segment_postings = reader.segment_postings(&Term::new("title", "common")).unwrap();
    assert_eq!(segment_postings.len(), 1);
    assert_eq!(segment_postings[0].doc_count(), 5);
}
