/*!

This is the long-form manual for `instant_runoff` and the `runoff` program.

## Input formats

The following formats are supported:
* `xlsx` Excel workbooks, as exported by Microsoft Forms or Google Forms
* `csv` Comma Separated Values with the same layout

When the input type is not given, it is guessed from the file extension.

### Layout

The first row holds the names of the candidates. Each following row is one
ballot, and each cell holds the rank given by this voter to the candidate of
its column. The first columns usually hold other information (a timestamp,
the email of the voter, ...) and are skipped: by default, the candidates start
at the second column (index `1`, counting from `0`).

```text
timestamp,Alice,Bob,Charlie
2022-11-01,1,2,
2022-11-01,,1,1
2022-11-02,,,
```

In this example:
- the first voter prefers Alice, then Bob. Charlie is ranked last.
- the second voter likes Bob and Charlie equally, and both are preferred to Alice.
- the third voter did not express any preference. This voter is indifferent
  between all the candidates, and the vote is split equally between all of them.

Lower ranks are preferred. Only the order of the ranks matters: `1,2,3` is the
same vote as `10,20,30`. Ranks may be decimal numbers. Empty cells mean that
the candidate is not ranked: all the candidates that are not ranked share the
last place.

## Counting

In each round, each ballot gives one vote to the candidates it prefers among
those still running. If it prefers several of them equally, the vote is split
equally between them: a ballot ranking Bob and Charlie first gives half a vote
to each. Counts are exact fractions.

A candidate with strictly more than half of the votes wins. Otherwise, the
candidates with the fewest votes are eliminated according to the tie-breaking
rule, and a new round starts.

## Tie-breaking rules

When several candidates share the fewest votes, the rule decides what happens:

* `refuse` (the default): all the tied candidates are eliminated together. If
  they are all the remaining candidates, the election ends in a tie, which
  is reported as such.
* `candidate-order`: the tied candidate that comes last in the order of the
  columns is eliminated.
* `random`: one of the tied candidates is drawn and eliminated. The draw is a
  hash of the seed, the round and the name of the candidate, so the same seed
  always gives the same result.
* `rvh` (random voter hierarchy): one strict order of all the candidates is
  drawn from the seed at the start of the election. In every round, the tied
  candidate that comes first in this order is eliminated.

The random rules require a seed (`--seed`).

## Command line

```text
runoff ballots.xlsx
runoff ballots.csv -f 2 -t random -s 42
runoff -c election.json -o stdout
```

The program prints the standings of each round and the winner. With `--out`,
a summary of the election is also written in JSON. With `--reference`, this
summary is compared with a reference file, and the program fails if they
differ.

## Configuration

Instead of the command line options, the election can be described in a JSON
file passed with `--config`. The options given on the command line take
precedence over the ones in the file.

```json
{
  "outputSettings": { "contestName": "Board election", "outputDirectory": "out" },
  "source": {
    "filePath": "ballots.xlsx",
    "provider": "xlsx",
    "firstVoteColumnIndex": 1,
    "excelWorksheetName": "Form1"
  },
  "rules": { "tiebreakMode": "randomVoterHierarchy", "randomSeed": "42" }
}
```

- `filePath` is relative to the location of the configuration file.
- `firstVoteColumnIndex` (number or string): the index of the first column of
  candidates, counting from `0`.
- `tiebreakMode`: one of `refuse`, `useCandidateOrder`, `random` and
  `randomVoterHierarchy`.
- `outputDirectory`: when set, the summary is written to `summary.json` in
  this directory, unless `--out` is given.

## Summary

```json
{
  "config": { "contest": "Board election", "tieBreakMode": "refuse" },
  "results": [
    { "round": 1, "tally": { "Alice": "3/2", "Bob": "1/2" },
      "tallyResults": [ { "elected": "Alice" } ] }
  ],
  "outcome": { "winner": "Alice" }
}
```

When the election ends in a tie, the outcome is `{ "tie": ["Alice", "Bob"] }`.

 */
