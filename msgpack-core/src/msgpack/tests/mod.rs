mod test_reader;
