pub mod splitting_result;
