pub mod merge_slashes;
